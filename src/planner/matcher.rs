//! Postfix matching against an existing index's column list

use std::collections::BTreeSet;

use crate::index::PropertySpec;

use super::requirement::{Postfix, PostfixGroup};

/// Matches `postfix` against the trailing columns of `index_properties`.
///
/// Groups are consumed from the end of the index, last group first.
/// Unordered groups compare name sets only; ordered groups require each
/// column to satisfy the required property aligned with it. Returns the leading columns
/// left over for the equality prefix, or `None` if the tail does not fit.
pub fn match_postfix<'a>(
    postfix: &Postfix,
    index_properties: &'a [PropertySpec],
) -> Option<&'a [PropertySpec]> {
    let mut end = index_properties.len();

    for group in postfix.groups().iter().rev() {
        let start = end.checked_sub(group.len())?;
        let tail = &index_properties[start..end];

        let matched = match group {
            PostfixGroup::Unordered(required) => {
                let have: BTreeSet<&str> = tail.iter().map(PropertySpec::name).collect();
                let want: BTreeSet<&str> = required.iter().map(PropertySpec::name).collect();
                have == want
            }
            PostfixGroup::Ordered(required) => tail
                .iter()
                .zip(required)
                .all(|(candidate, spec)| candidate.satisfies(spec)),
        };
        if !matched {
            return None;
        }

        end = start;
    }

    Some(&index_properties[..end])
}
