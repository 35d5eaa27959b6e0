//! Application services for the ledger.

mod ledger;

pub use ledger::{
    ApplicationLedgerError, ApplicationLedgerResult, ApplicationLedgerService, DecisionReceipt,
    SubmitApplicationRequest,
};
