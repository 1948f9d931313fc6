//! Numeric forms and picture-clause editing.
//!
//! Builds on the `tally_value` codec:
//!
//! - [`make_form`]: any numeric value to its fixed-decimal form.
//! - [`vformat`]: render a value through an edit picture.
//! - [`reshape_numeric`] / [`reshape_text`]: re-dimension a variable in
//!   place, growing only into extender bytes.
//! - [`numeric`]: integer/float readings, numeric text validation and
//!   exact comparison.
//!
//! Every operation that can fail returns the [`CondFlags`] bits it defines
//! rather than an error; see each function for which bits those are.
//!
//! [`CondFlags`]: tally_value::CondFlags

mod digits;
mod form;
pub mod numeric;
mod picture;
mod reshape;

pub use form::make_form;
pub use picture::vformat;
pub use reshape::{reshape_numeric, reshape_text};
