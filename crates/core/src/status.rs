//! Closed status enums stored as upper-case text in the database.
//!
//! Every lifecycle field (timesheet, invoice, contract, engagement) is declared
//! through [`define_status_enum!`], which pins the wire/database spelling of each
//! variant and generates parsing so that a row with an unknown status fails to
//! load instead of flowing through as a free-form string.

/// Declare a status enum with its canonical upper-case spellings.
///
/// Generates `as_str`, `ALL`, `Display`, `FromStr` (rejecting unknown values
/// with [`CoreError::Validation`](crate::error::CoreError::Validation)) and
/// `TryFrom<String>` for use with `#[sqlx(try_from = "String")]`.
#[macro_export]
macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The canonical database / wire spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        stringify!($name),
                        [$( $text ),+].join(", ")
                    ))),
                }
            }
        }

        impl ::std::convert::TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}
