//! 리스크 코어의 도메인 모델.

mod alert;
mod parameters;
mod portfolio;
mod trade;

pub use alert::*;
pub use parameters::*;
pub use portfolio::*;
pub use trade::*;
