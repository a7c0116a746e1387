//! String-keyed enums with a closed lookup table
//!
//! Scenes, patterns, and effects are addressed by string keys at the edges
//! (config files, the CLI, parameter surfaces) and by enum everywhere else.

/// Declare a `Copy` enum whose variants map one-to-one onto string keys.
///
/// Generates `ALL`, `key()`, `from_key()` and `from_key_or()`; the latter
/// logs unknown keys at debug level and returns the fallback.
macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $key:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// String key of this variant
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// Variant for `key`, if any
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Variant for `key`, or `fallback` when the key is unknown
            pub fn from_key_or(key: &str, fallback: Self) -> Self {
                Self::from_key(key).unwrap_or_else(|| {
                    tracing::debug!(
                        kind = stringify!($name),
                        key,
                        fallback = fallback.key(),
                        "unknown key, using fallback"
                    );
                    fallback
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

pub(crate) use keyed_enum;

#[cfg(test)]
mod tests {
    keyed_enum! {
        enum Sample {
            First => "first",
            Second => "second",
        }
    }

    #[test]
    fn test_key_round_trip() {
        for &v in Sample::ALL {
            assert_eq!(Sample::from_key(v.key()), Some(v));
        }
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(Sample::from_key("third"), None);
        assert_eq!(Sample::from_key_or("third", Sample::Second), Sample::Second);
        assert_eq!(Sample::First.to_string(), "first");
    }
}
