//! Board coordinates: files a-h and ranks 1-8.

use std::fmt;

macro_rules! coordinate {
    ($(#[$meta:meta])* $name:ident, $first:literal, [$($variant:ident),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            /// In index order.
            pub const ALL: [$name; 8] = [$($name::$variant),*];

            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Parse the coordinate character (`'a'..='h'` or `'1'..='8'`).
            pub fn from_char(c: char) -> Option<$name> {
                let offset = u32::from(c).checked_sub(u32::from($first))?;
                $name::ALL.get(usize::try_from(offset).ok()?).copied()
            }

            #[inline]
            pub const fn to_char(self) -> char {
                ($first as u8 + self as u8) as char
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_char())
            }
        }
    };
}

coordinate!(
    /// A column, a through h.
    File,
    'a',
    [FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH]
);

coordinate!(
    /// A row, 1 (White's back rank) through 8.
    Rank,
    '1',
    [Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8]
);

#[cfg(test)]
mod tests {
    use super::{File, Rank};

    #[test]
    fn chars() {
        for (i, file) in File::ALL.into_iter().enumerate() {
            assert_eq!(file.index(), i);
            assert_eq!(File::from_char(file.to_char()), Some(file));
        }
        for rank in Rank::ALL {
            assert_eq!(Rank::from_char(rank.to_char()), Some(rank));
        }
        assert_eq!(File::FileE.to_string(), "e");
        assert_eq!(Rank::Rank8.to_string(), "8");
    }

    #[test]
    fn rejects_out_of_range_chars() {
        for c in ['i', 'A', '`', '1'] {
            assert_eq!(File::from_char(c), None, "{c:?}");
        }
        for c in ['0', '9', 'a', ' '] {
            assert_eq!(Rank::from_char(c), None, "{c:?}");
        }
    }
}
