use super::Diagnostics;

/// Where a `#[bean(...)]` attribute appears; each position accepts a
/// different set of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Struct,
    Field,
    Enum,
    Variant,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

/// Options collected from every `#[bean(...)]` attribute on one item.
#[derive(Debug, Default)]
pub(crate) struct BeanAttr {
    /// `name = "..."` on a struct or enum, `rename = "..."` on a field or
    /// variant
    pub(crate) name: Option<syn::LitStr>,

    /// `display = "..."` on a variant
    pub(crate) display: Option<syn::LitStr>,

    pub(crate) access: Access,

    /// `skip` on a field
    pub(crate) skip: bool,
}

impl BeanAttr {
    pub(crate) fn from_ast(attrs: &[syn::Attribute], position: Position) -> syn::Result<BeanAttr> {
        let mut diagnostics = Diagnostics::default();
        let mut out = BeanAttr::default();

        for attr in attrs {
            if !attr.path().is_ident("bean") {
                continue;
            }

            let result = attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected an identifier"));
                };
                let option = ident.to_string();

                let allowed = match position {
                    Position::Struct | Position::Enum => &["name"][..],
                    Position::Field => &["rename", "skip", "read_only", "write_only"][..],
                    Position::Variant => &["rename", "display"][..],
                };

                if !allowed.contains(&option.as_str()) {
                    return Err(meta.error(format!(
                        "unsupported option `{option}`; expected one of: {}",
                        allowed.join(", ")
                    )));
                }

                match option.as_str() {
                    "name" | "rename" => {
                        set_once(&mut out.name, meta.value()?.parse()?, &meta, &option)
                    }
                    "display" => set_once(&mut out.display, meta.value()?.parse()?, &meta, &option),
                    "skip" => {
                        out.skip = true;
                        Ok(())
                    }
                    "read_only" | "write_only" => {
                        if out.access != Access::ReadWrite {
                            return Err(meta.error("conflicting access options"));
                        }
                        out.access = if option == "read_only" {
                            Access::ReadOnly
                        } else {
                            Access::WriteOnly
                        };
                        Ok(())
                    }
                    _ => unreachable!(),
                }
            });

            diagnostics.capture(result);
        }

        if out.skip && (out.name.is_some() || out.access != Access::ReadWrite) {
            diagnostics.at(
                proc_macro2::Span::call_site(),
                "a skipped field takes no other options",
            );
        }

        diagnostics.finish(out)
    }
}

fn set_once(
    slot: &mut Option<syn::LitStr>,
    value: syn::LitStr,
    meta: &syn::meta::ParseNestedMeta<'_>,
    option: &str,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate `{option}` option")));
    }
    if value.value().is_empty() {
        return Err(syn::Error::new_spanned(&value, format!("`{option}` must not be empty")));
    }
    *slot = Some(value);
    Ok(())
}
