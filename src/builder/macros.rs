//! Macros for naming machine states.

/// Generate a `Copy` enum of named states that converts to and from state
/// indices.
///
/// Variants are numbered in declaration order starting at 0. The generated
/// type has `COUNT`, `ALL`, `index()` and `name()`, plus `From<Enum> for
/// usize` and `TryFrom<usize>`. Declaring more than `MAX_STATES` variants
/// fails to compile.
///
/// # Example
///
/// ```
/// use bitfsm::fsm_states;
///
/// fsm_states! {
///     pub enum Stage {
///         Idle,
///         Heating,
///         Holding,
///     }
/// }
///
/// assert_eq!(Stage::COUNT, 3);
/// assert_eq!(Stage::Holding.index(), 2);
/// assert_eq!(Stage::try_from(1), Ok(Stage::Heating));
/// assert!(Stage::try_from(3).is_err());
/// ```
#[macro_export]
macro_rules! fsm_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $name {
            pub const COUNT: usize = [$(stringify!($variant)),+].len();
            pub const ALL: [$name; [$(stringify!($variant)),+].len()] = [$($name::$variant),+];

            pub fn index(self) -> usize {
                self as usize
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        const _: () = assert!(
            $name::COUNT <= $crate::MAX_STATES,
            "too many states for a bitfsm machine"
        );

        impl ::core::convert::From<$name> for usize {
            fn from(state: $name) -> usize {
                state as usize
            }
        }

        impl ::core::convert::TryFrom<usize> for $name {
            type Error = $crate::FsmError;

            fn try_from(state: usize) -> ::core::result::Result<Self, Self::Error> {
                Self::ALL
                    .get(state)
                    .copied()
                    .ok_or($crate::FsmError::StateOutOfRange {
                        state,
                        state_count: Self::COUNT,
                    })
            }
        }
    };
}
