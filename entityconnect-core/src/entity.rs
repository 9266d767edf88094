//! 实体能力（Capability）抽象
//!
//! 生成核心不关心实体的具体类型，只通过以下能力查询与实体耦合：
//! - `UuidAsPrimaryKey`：实体声明使用本地生成的 UUID 作为主键；
//! - `Detail`：实体暴露用于划分远端序列的组件名（component name）。
//!
//! 能力通过 `Persistable::as_uuid_keyed/as_detail` 显式声明，而非运行时反射；
//! 通常由 `#[detail]` 宏生成实现。
//!
use std::borrow::Cow;

/// 可被持久化的实体，对生成核心只暴露能力查询
pub trait Persistable: Send + Sync {
    /// 实体类型名（用于日志与“无可用策略”错误），泛型参数一并保留
    fn entity_type(&self) -> Cow<'static, str> {
        short_type_name(std::any::type_name::<Self>())
    }

    /// 若实体使用本地 UUID 主键，返回对应能力
    fn as_uuid_keyed(&self) -> Option<&dyn UuidAsPrimaryKey> {
        None
    }

    /// 若实体暴露组件名，返回对应能力
    fn as_detail(&self) -> Option<&dyn Detail> {
        None
    }
}

/// 标记：使用本地随机 UUID 作为主键
pub trait UuidAsPrimaryKey: Send + Sync {}

/// 暴露组件名，用于远端序列按组件划分命名空间
pub trait Detail: Send + Sync {
    fn component_name(&self) -> &str;
}

/// 拥有单一、写入后不可变的字符串主键
pub trait Identifiable {
    /// 当前主键（尚未持久化时为 `None`）
    fn id(&self) -> Option<&str>;

    /// 写入主键；仅由持久化前置钩子在首次保存时调用
    fn assign_id(&mut self, id: String);
}

/// 去掉类型名中每一段路径的模块前缀：
/// `app::Wrapper<app::inner::Line>` -> `Wrapper<Line>`
pub fn short_type_name(full: &'static str) -> Cow<'static, str> {
    const DELIMITERS: [char; 10] = ['<', '>', ',', '(', ')', '[', ']', '&', ';', ' '];

    if !full.contains(DELIMITERS) {
        return Cow::Borrowed(last_segment(full));
    }

    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if DELIMITERS.contains(&c) {
            out.push_str(last_segment(&full[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&full[start..]));
    Cow::Owned(out)
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Persistable for Plain {}

    struct Order;
    impl UuidAsPrimaryKey for Order {}
    impl Persistable for Order {
        fn as_uuid_keyed(&self) -> Option<&dyn UuidAsPrimaryKey> {
            Some(self)
        }
    }

    #[test]
    fn test_default_capabilities_are_absent() {
        let p = Plain;
        assert!(p.as_uuid_keyed().is_none());
        assert!(p.as_detail().is_none());
    }

    #[test]
    fn test_default_entity_type_is_short_name() {
        assert_eq!(Plain.entity_type(), "Plain");
        assert_eq!(Order.entity_type(), "Order");
    }

    mod inner {
        pub struct Line;
    }

    struct Wrapper<T>(std::marker::PhantomData<T>);
    impl<T: Send + Sync> Persistable for Wrapper<T> {}

    #[test]
    fn test_default_entity_type_keeps_generic_arguments() {
        let wrapper = Wrapper::<inner::Line>(std::marker::PhantomData);
        assert_eq!(wrapper.entity_type(), "Wrapper<Line>");

        let nested = Wrapper::<Wrapper<(inner::Line, String)>>(std::marker::PhantomData);
        assert_eq!(nested.entity_type(), "Wrapper<Wrapper<(Line, String)>>");
    }

    #[test]
    fn test_short_type_name_handles_references_and_slices() {
        assert_eq!(short_type_name("a::b::C"), "C");
        assert_eq!(short_type_name("&[core::option::Option<u8>]"), "&[Option<u8>]");
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, u32>"),
            "HashMap<String, u32>"
        );
        assert!(matches!(short_type_name("x::Plain"), Cow::Borrowed("Plain")));
    }

    #[entityconnect_macros::detail(component = "shipment")]
    struct Shipment {
        carrier: String,
    }

    #[test]
    fn test_macro_declared_entity() {
        let mut shipment = Shipment {
            carrier: "dhl".into(),
            ..Default::default()
        };
        assert_eq!(shipment.entity_type(), "Shipment");
        assert_eq!(
            shipment.as_detail().map(|d| d.component_name()),
            Some("shipment")
        );
        assert!(shipment.id().is_none());

        shipment.assign_id("SHI-1".into());
        assert_eq!(shipment.id(), Some("SHI-1"));
        assert_eq!(shipment.carrier, "dhl");
    }

    #[test]
    fn test_declared_capability_is_visible_through_dyn() {
        let e: &dyn Persistable = &Order;
        assert!(e.as_uuid_keyed().is_some());
        assert!(e.as_detail().is_none());
    }
}
