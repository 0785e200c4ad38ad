use crate::schema::{Access, Bean};

use proc_macro2::TokenStream;
use quote::quote;

pub(super) struct Expand<'a> {
    bean: &'a Bean,

    /// Path prefix for transmap types
    support: TokenStream,
}

impl<'a> Expand<'a> {
    pub(super) fn new(bean: &'a Bean) -> Expand<'a> {
        Expand {
            bean,
            support: super::support(),
        }
    }

    pub(super) fn expand(&self) -> TokenStream {
        let support = &self.support;
        let ident = &self.bean.ident;
        let class_def = self.expand_class_def();
        let register = self.expand_register();
        let into_value = self.expand_into_value();
        let load = self.expand_load();

        quote! {
            impl #support::Bean for #ident {
                fn class_id() -> #support::ClassId {
                    static ID: #support::OnceLock<#support::ClassId> = #support::OnceLock::new();
                    *ID.get_or_init(#support::ClassId::generate)
                }

                fn class_def() -> #support::ClassDef {
                    #class_def
                }
            }

            impl #support::Mappable for #ident {
                fn ty() -> #support::Type {
                    #support::Type::Object(<Self as #support::Bean>::class_id())
                }

                fn register(builder: &mut #support::schema::Builder) {
                    #register
                }

                fn into_value(
                    self,
                    schema: &#support::Schema,
                ) -> #support::Result<#support::Value> {
                    #into_value
                }

                fn load(value: #support::Value) -> #support::Result<Self> {
                    #load
                }
            }
        }
    }

    fn expand_class_def(&self) -> TokenStream {
        let support = &self.support;
        let name = &self.bean.name;

        let fields = self.bean.properties().map(|field| {
            let name = &field.name;
            let ty = &field.ty;
            let method = match field.access {
                Access::ReadWrite => quote!(field),
                Access::ReadOnly => quote!(read_only),
                Access::WriteOnly => quote!(write_only),
            };
            quote!(.#method(#name, <#ty as #support::Mappable>::ty()))
        });

        quote! {
            #support::ClassDef::with_id(<Self as #support::Bean>::class_id(), #name)
                #( #fields )*
        }
    }

    /// Declares the class once, then every type its fields refer to; the
    /// early return stops recursion through self-referencing fields.
    fn expand_register(&self) -> TokenStream {
        let support = &self.support;

        let field_types = self.bean.properties().map(|field| {
            let ty = &field.ty;
            quote!(<#ty as #support::Mappable>::register(builder);)
        });

        quote! {
            if builder.contains_class(<Self as #support::Bean>::class_id()) {
                return;
            }
            builder.class(<Self as #support::Bean>::class_def());
            #( #field_types )*
        }
    }

    fn expand_into_value(&self) -> TokenStream {
        let support = &self.support;

        let sets = self.bean.properties().map(|field| {
            let ident = &field.ident;
            let name = &field.name;
            quote! {
                object.set(#name, #support::Mappable::into_value(self.#ident, schema)?)?;
            }
        });

        quote! {
            let object = schema.instantiate(<Self as #support::Bean>::class_id())?;
            #( #sets )*
            #support::Result::Ok(#support::Value::Object(object))
        }
    }

    fn expand_load(&self) -> TokenStream {
        let support = &self.support;

        let fields = self.bean.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;
            let name = &field.name;

            if field.skip {
                quote!(#ident: ::core::default::Default::default())
            } else {
                quote!(#ident: <#ty as #support::Mappable>::load(object.get(#name)?)?)
            }
        });

        quote! {
            let object = value.to_object()?;
            #support::Result::Ok(Self {
                #( #fields, )*
            })
        }
    }
}
