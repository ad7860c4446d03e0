pub mod capability;
pub mod gemini;
pub mod request;
pub mod result;

pub use capability::*;
pub use gemini::*;
pub use request::*;
pub use result::*;
