use triwise_plan::scenario_json_schema;

fn main() {
    let schema = scenario_json_schema();
    let json = serde_json::to_string_pretty(&schema).expect("serialize scenario json schema");
    println!("{json}");
}
