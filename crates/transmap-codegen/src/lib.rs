mod expand;
mod schema;

use proc_macro2::TokenStream;

/// Expands `#[derive(Bean)]`.
pub fn generate_bean(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemStruct = syn::parse2(input)?;
    let bean = schema::Bean::from_ast(&item)?;

    Ok(expand::bean(&bean))
}

/// Expands `#[derive(BeanEnum)]`.
pub fn generate_bean_enum(input: TokenStream) -> syn::Result<TokenStream> {
    let item: syn::ItemEnum = syn::parse2(input)?;
    let bean_enum = schema::BeanEnum::from_ast(&item)?;

    Ok(expand::bean_enum(&bean_enum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn bean_error(input: TokenStream) -> String {
        match generate_bean(input) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn renamed_and_skipped_fields() {
        let item: syn::ItemStruct = syn::parse_quote! {
            #[bean(name = "Person")]
            struct PersonDto {
                #[bean(rename = "fullName")]
                name: String,
                #[bean(read_only)]
                id: i64,
                #[bean(skip)]
                cache: Vec<u8>,
            }
        };

        let bean = schema::Bean::from_ast(&item).unwrap();
        assert_eq!(bean.name, "Person");

        let names: Vec<_> = bean.properties().map(|f| &f.name[..]).collect();
        assert_eq!(names, ["fullName", "id"]);
        assert_eq!(bean.fields[1].access, schema::Access::ReadOnly);
        assert!(bean.fields[2].skip);
    }

    #[test]
    fn tuple_struct_is_rejected() {
        let err = bean_error(quote!(struct Point(i32, i32);));
        assert!(err.contains("named fields"), "{err}");
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = bean_error(quote! {
            struct Order {
                #[bean(display = "x")]
                id: i64,
            }
        });
        assert!(err.contains("unsupported option `display`"), "{err}");
    }

    #[test]
    fn conflicting_access_is_rejected() {
        let err = bean_error(quote! {
            struct Order {
                #[bean(read_only, write_only)]
                id: i64,
            }
        });
        assert!(err.contains("conflicting access"), "{err}");
    }

    #[test]
    fn duplicate_property_name_is_rejected() {
        let err = bean_error(quote! {
            struct Order {
                id: i64,
                #[bean(rename = "id")]
                other: i64,
            }
        });
        assert!(err.contains("duplicate property name `id`"), "{err}");
    }

    #[test]
    fn enum_display_text() {
        let item: syn::ItemEnum = syn::parse_quote! {
            enum Status {
                #[bean(display = "in progress")]
                InProgress,
                Done,
            }
        };

        let bean_enum = schema::BeanEnum::from_ast(&item).unwrap();
        assert_eq!(bean_enum.variants[0].display.as_deref(), Some("in progress"));
        assert_eq!(bean_enum.variants[1].display, None);
    }

    #[test]
    fn data_carrying_variant_is_rejected() {
        let err = match generate_bean_enum(quote!(enum Shape { Circle(f64) })) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err.to_string(),
        };
        assert!(err.contains("only unit variants"), "{err}");
    }
}
