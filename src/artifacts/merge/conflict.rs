use bytes::Bytes;

const OURS_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR: &[u8] = b"=======\n";
const THEIRS_MARKER: &[u8] = b">>>>>>>\n";

/// Content written to a conflicted file
///
/// Both versions are embedded verbatim (an absent side is empty); no newline
/// is added after either of them.
pub fn conflict_content(ours: &[u8], theirs: &[u8]) -> Bytes {
    let mut content = Vec::with_capacity(
        OURS_MARKER.len() + ours.len() + SEPARATOR.len() + theirs.len() + THEIRS_MARKER.len(),
    );
    content.extend_from_slice(OURS_MARKER);
    content.extend_from_slice(ours);
    content.extend_from_slice(SEPARATOR);
    content.extend_from_slice(theirs);
    content.extend_from_slice(THEIRS_MARKER);

    Bytes::from(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"ours\n", b"theirs\n", "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>>\n")]
    #[case(b"", b"theirs\n", "<<<<<<< HEAD\n=======\ntheirs\n>>>>>>>\n")]
    #[case(b"ours\n", b"", "<<<<<<< HEAD\nours\n=======\n>>>>>>>\n")]
    fn both_sides_are_embedded_between_markers(
        #[case] ours: &[u8],
        #[case] theirs: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(conflict_content(ours, theirs), Bytes::from(expected.to_string()));
    }
}
