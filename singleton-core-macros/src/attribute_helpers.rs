use proc_macro_error::abort;
use quote::quote;
use syn::{Attribute, LitStr};

/// 从属性中提取组件名称
/// 支持格式: #[singleton("ConfigCache")] 或 #[singleton(name = "ConfigCache")]
pub(crate) fn get_component_name(attrs: &[Attribute]) -> Option<String> {
    let attr = attrs.iter().find(|attr| attr.path().is_ident("singleton"))?;

    if let Ok(name_lit) = attr.parse_args::<LitStr>() {
        return Some(name_lit.value());
    }

    let mut name = None;
    let parsed = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            name = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported singleton attribute"))
        }
    });

    if let Err(e) = parsed {
        abort!(
            attr,
            "invalid #[singleton] attribute: {}", e;
            help = "use #[singleton(\"Name\")] or #[singleton(name = \"Name\")]"
        );
    }

    name
}

/// 从属性中提取是否启动时初始化
pub(crate) fn get_startup(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("startup"))
}

/// 按声明顺序提取并发管理类型
/// 支持格式: #[concurrency_management("bean")] 或 #[concurrency_management("container")]
pub(crate) fn get_concurrency_management(attrs: &[Attribute]) -> Vec<proc_macro2::TokenStream> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("concurrency_management"))
        .map(|attr| {
            let value = match attr.parse_args::<LitStr>() {
                Ok(value) => value,
                Err(_) => abort!(
                    attr,
                    "expected a string literal";
                    help = "use #[concurrency_management(\"bean\")] or #[concurrency_management(\"container\")]"
                ),
            };

            match value.value().to_lowercase().as_str() {
                "bean" => quote! { singleton_core::ConcurrencyManagementType::Bean },
                "container" => quote! { singleton_core::ConcurrencyManagementType::Container },
                other => abort!(
                    value.span(),
                    "unknown concurrency management type '{}'", other;
                    help = "expected \"bean\" or \"container\""
                ),
            }
        })
        .collect()
}
