/// Implements [`Record`](crate::Record), [`GoType`](crate::GoType),
/// [`Encode`](crate::Encode) and [`Bind`](crate::Bind) for a struct.
///
/// Each entry maps the field name written in goon text to a struct field.
/// Fields are written in the order listed. A `[skip]` field is never written
/// and never bound, so after a round trip it holds its `Default` value.
///
/// The struct must implement `Clone`, `PartialEq`, `Debug` and, for use with
/// a [`Registry`](crate::Registry), `Default`. Every listed field type must
/// implement `Encode`; bound fields must also implement `Bind`.
///
/// # Examples
///
/// ```rust
/// use goon::{decode_typed, encode, record, Encode, Registry};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Account {
///     name: String,
///     balance: f64,
///     session: String,
/// }
///
/// record! {
///     Account as "Account" in "bank" {
///         "Name" => name,
///         "Balance" => balance,
///         "Session" => session [skip],
///     }
/// }
///
/// let account = Some(Account { name: "ann".into(), balance: 10.5, session: "x1".into() });
/// let text = encode([("acct", &account as &dyn Encode)], "bank").unwrap();
/// assert_eq!(text, "package bank\n\nvar acct = &Account{\n\tName: \"ann\",\n\tBalance: 10.5,\n}\n\n");
///
/// let registry = Registry::new().with::<Account>();
/// let (doc, diagnostics) = decode_typed("bank.goon", &text, &registry).unwrap();
/// assert!(diagnostics.is_empty());
/// let decoded = doc.get("acct").and_then(|v| v.as_record::<Account>()).unwrap();
/// assert_eq!(decoded.name, "ann");
/// assert_eq!(decoded.session, "");
/// ```
#[macro_export]
macro_rules! record {
    (@excluded) => {
        false
    };
    (@excluded skip) => {
        true
    };

    (@bind $self:ident, $name:ident, $value:ident, $pos:ident, $binder:ident, $field_name:literal, $field:ident) => {
        if $name == $field_name {
            $binder.bind_into(&mut $self.$field, $value, $pos);
            return true;
        }
    };
    (@bind $self:ident, $name:ident, $value:ident, $pos:ident, $binder:ident, $field_name:literal, $field:ident skip) => {};

    (
        $ty:ty as $type_name:literal in $namespace:literal {
            $( $field_name:literal => $field:ident $([$flag:ident])? ),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn type_name(&self) -> $crate::TypeName {
                $crate::TypeName::new($namespace, $type_name)
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::Field {
                            name: $field_name,
                            value: &self.$field,
                            excluded: $crate::record!(@excluded $($flag)?),
                        }
                    ),*
                ]
            }

            fn bind_field(
                &mut self,
                name: &str,
                value: &$crate::GenericValue,
                pos: &$crate::Position,
                binder: &mut $crate::Binder<'_>,
            ) -> bool {
                $(
                    $crate::record!(@bind self, name, value, pos, binder, $field_name, $field $($flag)?);
                )*
                let _ = (name, value, pos, binder);
                false
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn $crate::Record> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn eq_record(&self, other: &dyn $crate::Record) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .map_or(false, |other| self == other)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::GoType for $ty {
            fn go_type(namespace: &str) -> ::std::string::String {
                $crate::TypeName::new($namespace, $type_name).qualified(namespace)
            }
        }

        impl $crate::Encode for $ty {
            fn encode(&self, enc: &mut $crate::Encoder) -> $crate::Result<()> {
                enc.write_record(self)
            }

            fn encode_ref(&self, enc: &mut $crate::Encoder) -> $crate::Result<()> {
                enc.write_raw("&");
                enc.write_record(self)
            }
        }

        impl $crate::Bind for $ty {
            fn bind(
                value: &$crate::GenericValue,
                pos: &$crate::Position,
                binder: &mut $crate::Binder<'_>,
            ) -> ::std::result::Result<Self, $crate::BindError> {
                binder.bind_record::<Self>(value, pos)
            }
        }
    };
}
