//! Macros for declaring device states.

/// Declare a closed state enum with a display name per variant.
///
/// Generates the enum with the derives [`State`](crate::core::State)
/// requires, the `State` and `Display` implementations, and an `ALL` constant
/// listing every variant in declaration order.
///
/// # Example
///
/// ```
/// use stateful_device::core::State;
/// use stateful_device::state_enum;
///
/// state_enum! {
///     pub enum TurnstileState {
///         Locked => "Locked",
///         Unlocked => "Unlocked",
///     }
/// }
///
/// assert_eq!(TurnstileState::Unlocked.name(), "Unlocked");
/// assert_eq!(TurnstileState::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            $vis const ALL: &[Self] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $display),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
