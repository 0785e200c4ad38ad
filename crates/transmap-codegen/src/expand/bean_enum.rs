use crate::schema::BeanEnum;

use proc_macro2::{Literal, TokenStream};
use quote::quote;

pub(super) struct Expand<'a> {
    bean_enum: &'a BeanEnum,

    /// Path prefix for transmap types
    support: TokenStream,
}

impl<'a> Expand<'a> {
    pub(super) fn new(bean_enum: &'a BeanEnum) -> Expand<'a> {
        Expand {
            bean_enum,
            support: super::support(),
        }
    }

    pub(super) fn expand(&self) -> TokenStream {
        let support = &self.support;
        let ident = &self.bean_enum.ident;
        let name = &self.bean_enum.name;

        let variants = self.bean_enum.variants.iter().map(|variant| {
            let name = &variant.name;
            match &variant.display {
                Some(display) => quote!(.variant_with_display(#name, #display)),
                None => quote!(.variant(#name)),
            }
        });

        let to_index = self
            .bean_enum
            .variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                let variant = &variant.ident;
                let index = Literal::usize_unsuffixed(index);
                quote!(#ident::#variant => #index)
            });

        let from_index = self
            .bean_enum
            .variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                let variant = &variant.ident;
                let index = Literal::usize_unsuffixed(index);
                quote!(#index => #support::Result::Ok(#ident::#variant))
            });

        quote! {
            impl #support::BeanEnum for #ident {
                fn enum_id() -> #support::EnumId {
                    static ID: #support::OnceLock<#support::EnumId> = #support::OnceLock::new();
                    *ID.get_or_init(#support::EnumId::generate)
                }

                fn enum_type() -> #support::EnumType {
                    #support::EnumType::with_id(<Self as #support::BeanEnum>::enum_id(), #name)
                        #( #variants )*
                }
            }

            impl #support::Mappable for #ident {
                fn ty() -> #support::Type {
                    #support::Type::Enum(<Self as #support::BeanEnum>::enum_id())
                }

                fn register(builder: &mut #support::schema::Builder) {
                    if !builder.contains_enum(<Self as #support::BeanEnum>::enum_id()) {
                        builder.enum_type(<Self as #support::BeanEnum>::enum_type());
                    }
                }

                fn into_value(
                    self,
                    _schema: &#support::Schema,
                ) -> #support::Result<#support::Value> {
                    let variant = match self {
                        #( #to_index, )*
                    };
                    #support::Result::Ok(#support::Value::Enum(#support::ValueEnum::new(
                        <Self as #support::BeanEnum>::enum_id(),
                        variant,
                    )))
                }

                fn load(value: #support::Value) -> #support::Result<Self> {
                    let value = value.to_enum()?;
                    if value.ty != <Self as #support::BeanEnum>::enum_id() {
                        return #support::Result::Err(#support::Error::type_conversion(
                            #support::Value::Enum(value),
                            #name,
                        ));
                    }
                    match value.variant {
                        #( #from_index, )*
                        _ => #support::Result::Err(#support::Error::type_conversion(
                            #support::Value::Enum(value),
                            #name,
                        )),
                    }
                }
            }
        }
    }
}
