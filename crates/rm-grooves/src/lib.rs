//! rm-grooves: groove families, their parameter schemas and the rules that
//! decide which optional parameters may be given together.

pub mod catalog;
pub mod error;
pub mod evaluate;
pub mod instance;
pub mod param;

pub use catalog::{
    Advisory, Arity, ArityGroup, GrooveFamily, GrooveParameterSpec, GrooveSchema, schema_for,
};
pub use error::GrooveError;
pub use evaluate::{ConstraintStatus, Evaluation, GroupEvaluation, evaluate, evaluate_instance};
pub use instance::GrooveInstance;
pub use param::GrooveParam;
