//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Variants are (de)serialized and parsed in `kebab-case`. Parsing ignores
/// ASCII case. The calling crate must depend on [`serde`] and [`strum`].
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         #[label = "Cube"]
///         Cube,
///
///         #[doc = "A sphere"]
///         #[label = "Sphere"]
///         Sphere,
///     }
/// }
///
/// assert_eq!("SPHERE".parse::<Kind>(), Ok(Kind::Sphere));
/// assert_eq!(Kind::Cube.to_string(), "cube");
/// assert_eq!(Kind::Cube.label(), "Cube");
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                #[label = $label:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::serde::Deserialize,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            $crate::private::strum::IntoStaticStr,
            Eq,
            Hash,
            PartialEq,
            $crate::private::serde::Serialize,
        )]
        #[doc = $doc]
        #[serde(rename_all = "kebab-case")]
        #[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the `kebab-case` slug of this value.
            #[must_use]
            pub fn slug(self) -> &'static str {
                self.into()
            }

            /// Returns the human-readable label of this value.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $label,
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_kind! {
        #[doc = "Test kind."]
        enum Shape {
            #[doc = "Cube."]
            #[label = "Cube"]
            Cube,

            #[doc = "Tall pyramid."]
            #[label = "Tall pyramid"]
            TallPyramid,
        }
    }

    #[test]
    fn parses_ignoring_case() {
        assert_eq!("cube".parse::<Shape>(), Ok(Shape::Cube));
        assert_eq!("Tall-Pyramid".parse::<Shape>(), Ok(Shape::TallPyramid));
        assert!("sphere".parse::<Shape>().is_err());
    }

    #[test]
    fn formats_as_kebab_case() {
        assert_eq!(Shape::TallPyramid.to_string(), "tall-pyramid");
        assert_eq!(Shape::TallPyramid.slug(), "tall-pyramid");
        assert_eq!(Shape::TallPyramid.label(), "Tall pyramid");
        assert_eq!(Shape::ALL, &[Shape::Cube, Shape::TallPyramid]);
    }
}
