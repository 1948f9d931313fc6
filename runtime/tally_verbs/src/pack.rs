//! Concatenation of a list into one text value, and the reverse split.

use tally_bridge::{from_text, store_int};
use tally_edit::make_form;
use tally_edit::numeric::is_numeric_bytes;
use tally_value::{classify, logical, payload, set_window, CondFlags};

use crate::readable;

/// Concatenate the sources into the text value `dest`.
///
/// Logical mode copies each source's logical window and skips empty
/// sources. Physical mode copies each source's payload up to its last
/// logical position, then pads with spaces to its physical length; an
/// empty or null source contributes its physical length in spaces.
/// Numerics contribute their form in either mode.
///
/// Running out of room sets `EOS`, truncates at the boundary and ignores
/// the remaining sources. The destination window becomes `1..=written`,
/// or empty when nothing was written. A destination that is not text is
/// left alone and `OVER` is returned.
pub fn pack(dest: &mut [u8], list: &[&[u8]], physical: bool) -> CondFlags {
    let layout = classify(dest);
    if !layout.kind.is_text() {
        return CondFlags::OVER;
    }
    let range = layout.payload_range();
    let end = range.end.min(dest.len());
    let start = range.start.min(end);
    let body = &mut dest[start..end];

    let mut flags = CondFlags::empty();
    let mut written = 0;
    for &source in list {
        let view = readable(source);
        let source_layout = classify(&view);
        let (copy, pad): (&[u8], usize) = match (source_layout.logical_range(), physical) {
            (None, false) => continue,
            (None, true) => (&[], source_layout.pl),
            (Some(_), false) => (logical(&view), 0),
            (Some(_), true) => {
                let lp = source_layout.lp as usize;
                let bytes = payload(&view);
                let copy = &bytes[..lp.min(bytes.len())];
                (copy, source_layout.pl.saturating_sub(lp))
            }
        };

        let room = body.len() - written;
        let (copy, pad) = if copy.len() + pad > room {
            flags |= CondFlags::EOS;
            if copy.len() > room {
                (&copy[..room], 0)
            } else {
                (copy, room - copy.len())
            }
        } else {
            (copy, pad)
        };
        body[written..written + copy.len()].copy_from_slice(copy);
        written += copy.len();
        body[written..written + pad].fill(b' ');
        written += pad;
        if flags.contains(CondFlags::EOS) {
            break;
        }
    }

    if written == 0 {
        set_window(dest, 0, 0);
    } else {
        set_window(dest, 1, written);
    }
    tracing::trace!(written, physical, "pack");
    flags
}

/// Split the logical text of `source` across `dests`.
///
/// - Numeric destination: takes as many bytes as its form is wide. The
///   slice must read as a number; otherwise the destination is set to zero
///   and `OVER` is returned.
/// - Text destination: takes up to its physical length and is padded with
///   spaces; its window covers the bytes taken.
///
/// Once the source is exhausted, numeric destinations receive zero and
/// text destinations are blanked with an empty window. A null or empty
/// source sets `EOS`. Other destinations are skipped.
pub fn unpack(source: &[u8], dests: &mut [&mut [u8]]) -> CondFlags {
    let view = readable(source);
    let mut rest: &[u8] = if classify(source).is_null() {
        &[]
    } else {
        logical(&view)
    };
    let mut flags = CondFlags::empty();
    if rest.is_empty() {
        flags |= CondFlags::EOS;
    }

    for dest in dests.iter_mut() {
        let dest: &mut [u8] = dest;
        let layout = classify(dest);
        if layout.var_type.is_numvar() {
            if rest.is_empty() {
                store_int(0, dest);
                continue;
            }
            let width = make_form(dest).len() - 1;
            let take = width.min(rest.len());
            let (slice, tail) = rest.split_at(take);
            rest = tail;
            if !is_numeric_bytes(slice) || from_text(slice, dest).is_err() {
                store_int(0, dest);
                flags |= CondFlags::OVER;
            }
        } else if layout.kind.is_text() {
            let range = layout.payload_range();
            let end = range.end.min(dest.len());
            let start = range.start.min(end);
            let body = &mut dest[start..end];
            let take = body.len().min(rest.len());
            let (slice, tail) = rest.split_at(take);
            rest = tail;
            body[..take].copy_from_slice(slice);
            body[take..].fill(b' ');
            if take == 0 {
                set_window(dest, 0, 0);
            } else {
                set_window(dest, 1, take);
            }
        }
    }
    flags
}
