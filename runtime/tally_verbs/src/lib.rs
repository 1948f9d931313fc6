//! List and aggregate verbs over tagged values.
//!
//! A read list is `&[&[u8]]` and a write list is `&mut [&mut [u8]]`; each
//! element is one tagged value. Verbs report their outcome as
//! [`CondFlags`](tally_value::CondFlags); each function names the bits it
//! defines.

use std::borrow::Cow;

use tally_edit::make_form;
use tally_value::{classify, VarType};

mod check;
mod count;
mod pack;
mod replace;
mod scan;
mod search;

pub use check::{check_digit, CheckKind};
pub use count::count;
pub use pack::{pack, unpack};
pub use replace::replace;
pub use scan::scan;
pub use search::{search, Search, SearchMode};

/// The buffer itself, or its form when it is an int, a float or null
/// numeric.
pub(crate) fn readable(buf: &[u8]) -> Cow<'_, [u8]> {
    let var_type = classify(buf).var_type;
    if var_type.is_numvar() && var_type.intersects(VarType::NEEDS_FORM) {
        Cow::Owned(make_form(buf).into_bytes())
    } else {
        Cow::Borrowed(buf)
    }
}
