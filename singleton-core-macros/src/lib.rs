mod attribute_helpers;
mod singleton_impl;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

/// Singleton派生宏
///
/// 为类型实现 `singleton_core::Singleton`，并通过 inventory 提交注解元数据，
/// 构建阶段由 `SingletonDescriptionProcessor::scan_annotations` 扫描。
///
/// 用法：
/// ```ignore
/// #[derive(Singleton)]
/// #[singleton("configCache")]                // 可选：指定组件名称（简写形式）
/// // 或
/// #[singleton(name = "configCache")]         // 可选：指定组件名称（完整形式）
/// #[startup]                                 // 可选：启动时初始化
/// #[concurrency_management("bean")]          // 可选：bean / container
/// ```
///
/// 可以出现多个 `#[concurrency_management]`，它们按声明顺序应用，
/// 相互矛盾时在处理阶段报错。
#[proc_macro_derive(Singleton, attributes(singleton, startup, concurrency_management))]
#[proc_macro_error]
pub fn derive_singleton(input: TokenStream) -> TokenStream {
    singleton_impl::derive_singleton_impl(input)
}
