// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成演示订单批次 JSON 文件
// 输出: tests/fixtures/datasets/orders_page_*.json
// ==========================================

use chrono::Utc;
use std::error::Error;
use std::fs;
use std::path::Path;
use stock_allocation::importer::{MockOrderSource, OrderSource};

const PAGE_SIZE: usize = 10;
const PAGE_COUNT: usize = 7;
const OUTPUT_DIR: &str = "tests/fixtures/datasets";

fn main() -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let output_dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(output_dir)?;

    let mut source = MockOrderSource::new();

    for page in 1..=PAGE_COUNT {
        let batch = source.next_batch(PAGE_SIZE, now);
        let path = output_dir.join(format!("orders_page_{:02}.json", page));
        fs::write(&path, serde_json::to_string_pretty(&batch)?)?;
        println!(
            "已生成 {} ({} 条订单)",
            path.display(),
            batch.len()
        );
    }

    println!("共生成 {} 页演示订单数据", PAGE_COUNT);
    Ok(())
}
