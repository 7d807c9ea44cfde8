use proc_macro::TokenStream;
use proc_macro_error::abort;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::attribute_helpers::{get_component_name, get_concurrency_management, get_startup};

pub(crate) fn derive_singleton_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    if !input.generics.params.is_empty() {
        abort!(
            input.generics,
            "singleton components cannot be generic";
            help = "declare a concrete type for each singleton"
        );
    }

    // 默认使用类型名作为组件名称
    let type_name = name.to_string();
    let component_name = get_component_name(&input.attrs).unwrap_or_else(|| type_name.clone());
    let init_on_startup = get_startup(&input.attrs);
    let concurrency_management = get_concurrency_management(&input.attrs);

    let expanded = quote! {
        impl singleton_core::Singleton for #name {
            fn component_name() -> &'static str {
                #component_name
            }

            fn init_on_startup() -> bool {
                #init_on_startup
            }

            fn concurrency_management() -> &'static [singleton_core::ConcurrencyManagementType] {
                &[#(#concurrency_management),*]
            }
        }

        singleton_core::inventory::submit! {
            singleton_core::SingletonRegistration {
                component_name: #component_name,
                component_class_name: concat!(module_path!(), "::", #type_name),
                module_path: module_path!(),
                init_on_startup: #init_on_startup,
                concurrency_management: &[#(#concurrency_management),*],
            }
        }
    };

    TokenStream::from(expanded)
}
