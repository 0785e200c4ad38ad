mod bean;
mod bean_enum;

use crate::schema;

use proc_macro2::TokenStream;
use quote::quote;

pub(super) fn bean(bean: &schema::Bean) -> TokenStream {
    wrap_in_const(bean::Expand::new(bean).expand())
}

pub(super) fn bean_enum(bean_enum: &schema::BeanEnum) -> TokenStream {
    wrap_in_const(bean_enum::Expand::new(bean_enum).expand())
}

fn support() -> TokenStream {
    quote!(_transmap::codegen_support)
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use transmap as _transmap;
            #code
        };
    }
}
