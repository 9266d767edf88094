use crate::derive_utils::apply_derives;
use crate::field_utils::{ensure_leading_field, find_field, is_option_string};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Generics, Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[detail] 宏实现
/// - 若缺失则追加字段 `id: Option<String>` 并置于字段最前；已声明的 `id` 必须是该类型
/// - 实现 `Identifiable`（写入一次的字符串主键）与 `Persistable`（能力查询）
/// - 泛型参数在能力实现上追加 `Send + Sync` 约束
/// - 支持参数：`#[detail(uuid, component = "...", debug = true|false)]`
///   - `uuid`：实现 `UuidAsPrimaryKey`，由本地 UUID 策略生成主键
///   - `component`：实现 `Detail`，由远端序列按该组件名生成主键
///   - `debug` 默认 `true`（派生 Debug）。为 `false` 时不派生，便于自定义实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as DetailAttrConfig);
    let input = parse_macro_input!(item as Item);

    expand_item(cfg, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_item(cfg: DetailAttrConfig, input: Item) -> Result<proc_macro2::TokenStream> {
    let mut st = match input {
        Item::Struct(s) => s,
        other => return Err(syn::Error::new(other.span(), "#[detail] only on struct")),
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => return Err(syn::Error::new(st.span(), "only supports named-field struct")),
    };

    if let Some(existing) = find_field(fields_named, "id") {
        if !is_option_string(&existing.ty) {
            return Err(syn::Error::new(
                existing.ty.span(),
                "`id` field must be `Option<String>`",
            ));
        }
    }

    let id_ty: Type = syn::parse_quote! { ::core::option::Option<::std::string::String> };
    ensure_leading_field(fields_named, "id", &id_ty);

    let mut required: Vec<syn::Path> = vec![syn::parse_quote!(Default)];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();
    let bounded = with_send_sync_bounds(&st.generics);
    let (_, _, bounded_where) = bounded.split_for_impl();

    // 泛型结构体沿用默认实现，类型名中保留实际的类型参数
    let entity_type_method = if st.generics.params.is_empty() {
        let type_name = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            fn entity_type(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#type_name)
            }
        }
    } else {
        quote! {}
    };

    let (uuid_impl, uuid_method) = if cfg.uuid {
        (
            quote! {
                impl #impl_generics ::entityconnect_core::entity::UuidAsPrimaryKey
                    for #ident #ty_generics #bounded_where {}
            },
            quote! {
                fn as_uuid_keyed(&self) -> ::core::option::Option<&dyn ::entityconnect_core::entity::UuidAsPrimaryKey> {
                    ::core::option::Option::Some(self)
                }
            },
        )
    } else {
        (quote! {}, quote! {})
    };

    let (detail_impl, detail_method) = match &cfg.component {
        Some(component) => (
            quote! {
                impl #impl_generics ::entityconnect_core::entity::Detail for #ident #ty_generics #bounded_where {
                    fn component_name(&self) -> &str { #component }
                }
            },
            quote! {
                fn as_detail(&self) -> ::core::option::Option<&dyn ::entityconnect_core::entity::Detail> {
                    ::core::option::Option::Some(self)
                }
            },
        ),
        None => (quote! {}, quote! {}),
    };

    Ok(quote! {
        #st

        impl #impl_generics ::entityconnect_core::entity::Identifiable for #ident #ty_generics #where_clause {
            fn id(&self) -> ::core::option::Option<&str> { self.id.as_deref() }

            fn assign_id(&mut self, id: ::std::string::String) { self.id = ::core::option::Option::Some(id); }
        }

        impl #impl_generics ::entityconnect_core::entity::Persistable for #ident #ty_generics #bounded_where {
            #entity_type_method

            #uuid_method

            #detail_method
        }

        #uuid_impl

        #detail_impl
    })
}

/// 能力 trait 均要求 `Send + Sync`，为每个类型参数补上约束
fn with_send_sync_bounds(generics: &Generics) -> Generics {
    let mut bounded = generics.clone();
    let params: Vec<syn::Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = bounded.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(syn::parse_quote! { #param: ::core::marker::Send + ::core::marker::Sync });
    }
    bounded
}

// -------- parsing --------

#[derive(Default)]
struct DetailAttrConfig {
    uuid: bool,
    component: Option<LitStr>,
    derive_debug: Option<bool>,
}

impl Parse for DetailAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();

        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<DetailAttrElem, Token![,]> =
            Punctuated::<DetailAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                DetailAttrElem::Uuid(span) => {
                    if cfg.uuid {
                        return Err(syn::Error::new(span, "duplicate key 'uuid' in attribute"));
                    }
                    cfg.uuid = true;
                }
                DetailAttrElem::Component(lit) => {
                    if cfg.component.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'component' in attribute",
                        ));
                    }
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "'component' must be a non-empty string",
                        ));
                    }
                    cfg.component = Some(lit);
                }
                DetailAttrElem::Debug(span, b) => {
                    if cfg.derive_debug.is_some() {
                        return Err(syn::Error::new(span, "duplicate key 'debug' in attribute"));
                    }
                    cfg.derive_debug = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum DetailAttrElem {
    Uuid(proc_macro2::Span),
    Component(LitStr),
    Debug(proc_macro2::Span, bool),
}

impl Parse for DetailAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "uuid" {
            Ok(DetailAttrElem::Uuid(key.span()))
        } else if key == "component" {
            let _eq: Token![=] = input.parse()?;
            let lit: LitStr = input.parse()?;
            Ok(DetailAttrElem::Component(lit))
        } else if key == "debug" {
            let _eq: Token![=] = input.parse()?;
            let lit: syn::LitBool = input.parse()?;
            Ok(DetailAttrElem::Debug(key.span(), lit.value()))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'uuid', 'component' or 'debug'",
            ))
        }
    }
}
