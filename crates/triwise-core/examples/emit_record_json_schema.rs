use schemars::schema_for;
use triwise_core::CombinationRecord;

fn main() {
    let schema = schema_for!(CombinationRecord);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
