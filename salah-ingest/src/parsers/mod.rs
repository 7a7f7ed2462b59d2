pub mod yearly_json;

pub use yearly_json::parse_yearly_json;
