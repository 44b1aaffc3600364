#[doc(inline)]
pub use region::*;
