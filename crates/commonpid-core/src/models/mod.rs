pub mod work;
pub mod work_type;

pub use work::*;
pub use work_type::{RegistrationAgency, WorkType};
