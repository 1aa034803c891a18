//! Macros for ergonomic state declaration.

/// Declare an enum usable as a state identifier.
///
/// Generates the derives required by [`StateId`](crate::core::StateId), a
/// `Display` impl printing the variant name, and a
/// [`StateVariants`](crate::core::StateVariants) impl listing every variant.
/// Variants are ordered by declaration, which fixes the order validation
/// walks them in.
///
/// # Example
///
/// ```
/// use statewarden::state_id;
/// use statewarden::core::StateVariants;
///
/// state_id! {
///     pub enum JobState {
///         Init,
///         Create,
///         Run,
///         Done,
///         Fail,
///     }
/// }
///
/// assert_eq!(JobState::ALL.len(), 5);
/// assert_eq!(JobState::Run.to_string(), "Run");
/// ```
#[macro_export]
macro_rules! state_id {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateVariants for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::StateVariants::name(self))
            }
        }
    };
}
