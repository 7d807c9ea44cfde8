use singleton_core::prelude::*;

// ==================== 单例组件定义 ====================

mod catalog {
    use singleton_core_macros::Singleton;

    /// 启动时加载的价格表，自身负责同步
    #[derive(Singleton)]
    #[startup]
    #[concurrency_management("bean")]
    pub struct PriceBook;

    /// 由容器管理并发的库存计数器
    #[derive(Singleton)]
    #[singleton("inventoryCounter")]
    pub struct InventoryCounter;
}

mod misconfigured {
    use singleton_core_macros::Singleton;

    #[derive(Singleton)]
    #[concurrency_management("container")]
    pub struct AuditTrail;
}

// 部署描述符：补充注解没有声明的信息，并声明一个新的单例
const CATALOG_DESCRIPTOR: &str = r#"
[[singleton]]
name = "inventoryCounter"
concurrency-management = "container"

[[singleton]]
name = "ExchangeRates"
class = "shop::rates::ExchangeRates"
init-on-startup = true
"#;

// 与 AuditTrail 上的注解相矛盾
const MISCONFIGURED_DESCRIPTOR: &str = r#"
[[singleton]]
name = "AuditTrail"
concurrency-management = "bean"
"#;

fn build_unit(
    module: &str,
    scan_path: &str,
    descriptor: &str,
) -> Result<Vec<SingletonComponentConfiguration>> {
    let descriptor = descriptor
        .parse::<DeploymentDescriptor>()
        .with_context(|| format!("Failed to load deployment descriptor for module '{}'", module))?;

    let unit = DeploymentUnit::new("shop", module).with_scan_path(scan_path);
    let processor = SingletonDescriptionProcessor::new(unit);
    processor.process(Some(&descriptor))?;
    Ok(processor.finish())
}

// ==================== 主程序 ====================

fn main() -> Result<()> {
    LoggingConfig::from_env().init()?;

    println!("\n╔════════════════════════════════════════════════════╗");
    println!("║     Singleton Descriptors - Build Phase Demo       ║");
    println!("╚════════════════════════════════════════════════════╝\n");

    let configurations = build_unit(
        "catalog",
        concat!(module_path!(), "::catalog"),
        CATALOG_DESCRIPTOR,
    )?;

    println!("📦 Module 'catalog':");
    for configuration in &configurations {
        println!("   {}", configuration);
    }

    // 冲突的单元会被整体拒绝，其它单元不受影响
    match build_unit(
        "audit",
        concat!(module_path!(), "::misconfigured"),
        MISCONFIGURED_DESCRIPTOR,
    ) {
        Ok(_) => tracing::warn!("Misconfigured module unexpectedly deployed"),
        Err(e) => println!("\n❌ Module 'audit' rejected: {:#}", e),
    }

    Ok(())
}
