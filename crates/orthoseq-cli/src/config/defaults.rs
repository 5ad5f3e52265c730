use orthoseq::core::oracle::KeyOrder;

pub struct DefaultsConfig {
    pub on_target_sigma: f64,
    pub use_cache: bool,
    pub key_order: KeyOrder,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            on_target_sigma: 1.0,
            use_cache: true,
            key_order: KeyOrder::Unordered,
        }
    }
}
