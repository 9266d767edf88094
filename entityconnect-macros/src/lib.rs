use proc_macro::TokenStream;

mod derive_utils;
mod detail;
mod field_utils;

/// 持久化实体宏
/// - 追加字段：`id: Option<String>`（若缺失）并置于字段最前
/// - 自动实现 `::entityconnect_core::entity::{Identifiable, Persistable}`
/// - 支持参数：
///   - `#[detail(uuid)]`：声明使用本地 UUID 主键
///   - `#[detail(component = "order")]`：声明组件名，由远端序列生成主键
///   - `#[detail(debug = false)]`：不派生 Debug
///
/// 未声明任何能力的实体仍可持久化，但生成服务会返回“无可用策略”错误。
#[proc_macro_attribute]
pub fn detail(attr: TokenStream, item: TokenStream) -> TokenStream {
    detail::expand(attr, item)
}
