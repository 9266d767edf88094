use syn::{Field, FieldsNamed, Token, Type, punctuated::Punctuated};

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体包含指定字段，并将其移至最前
/// - 若已存在则复用原字段定义（含属性与可见性）；
/// - 若缺失则以给定类型新增；
/// - 其余字段保持原有相对顺序。
pub(crate) fn ensure_leading_field(fields_named: &mut FieldsNamed, name: &str, ty: &Type) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    match old_named.iter().find(|f| is_named(f, name)) {
        Some(existing) => new_named.push(existing.clone()),
        None => {
            let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
            let field: Field = syn::parse_quote! { #ident: #ty };
            new_named.push(field);
        }
    }

    for f in old_named.into_iter() {
        if !is_named(&f, name) {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}

pub(crate) fn find_field<'a>(fields_named: &'a FieldsNamed, name: &str) -> Option<&'a Field> {
    fields_named.named.iter().find(|f| is_named(f, name))
}

/// 是否为 `Option<String>`（允许带路径前缀，如 `::core::option::Option<std::string::String>`）
pub(crate) fn is_option_string(ty: &Type) -> bool {
    let Some(option) = last_segment(ty) else {
        return false;
    };
    if option.ident != "Option" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &option.arguments else {
        return false;
    };
    if args.args.len() != 1 {
        return false;
    }
    match args.args.first() {
        Some(syn::GenericArgument::Type(inner)) => last_segment(inner)
            .map(|s| s.ident == "String" && s.arguments.is_none())
            .unwrap_or(false),
        _ => false,
    }
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    }
}
