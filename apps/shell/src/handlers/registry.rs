use chub_domain::config::EncryptionConfig;
use chub_interceptor::FieldRegistry;

pub fn print(config: &EncryptionConfig) {
    let registry = FieldRegistry::from_entries(&config.registry);
    for (entity, fields) in registry.entries() {
        println!("{entity}: {}", fields.join(", "));
    }
}
