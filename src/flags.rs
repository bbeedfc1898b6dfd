use bitflags::bitflags;

bitflags! {
    /// Match-time behaviour toggles.
    ///
    /// The empty set is the `NOFLAG` default. Flags can be supplied through
    /// [`crate::Regex::with_flags`] or inline at the top of a pattern, e.g.
    /// `(?im)foo`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        /// Case-insensitive matching of literals and classes (ASCII).
        const IGNORECASE = 1 << 0;
        /// `^` and `$` also match around interior newlines.
        const MULTILINE = 1 << 1;
        /// `.` matches `\n` as well.
        const DOTALL = 1 << 2;
    }
}

impl Flags {
    /// Parse a single inline-flag letter as written in `(?ims)`.
    #[must_use]
    pub(crate) fn from_letter(c: char) -> Option<Self> {
        match c {
            'i' => Some(Self::IGNORECASE),
            'm' => Some(Self::MULTILINE),
            's' => Some(Self::DOTALL),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(Flags::from_letter('i'), Some(Flags::IGNORECASE));
        assert_eq!(Flags::from_letter('m'), Some(Flags::MULTILINE));
        assert_eq!(Flags::from_letter('s'), Some(Flags::DOTALL));
        assert_eq!(Flags::from_letter('x'), None);
    }

    #[test]
    fn empty_is_noflag() {
        assert!(Flags::default().is_empty());
        assert!(!Flags::default().contains(Flags::IGNORECASE));
    }
}
