use log::LevelFilter;
use std::env;
use trellis::{EntityDescriptor, EntityType, Node};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// True if one of `children` is named `name` and describes `entity`.
#[allow(dead_code)]
pub fn is_child_in_list(name: &str, entity: EntityType, children: &[Node<EntityDescriptor>]) -> bool {
    children.iter().any(|c| {
        let descriptor = c.value();
        descriptor.name().eq_ignore_ascii_case(name) && descriptor.entity_type() == entity
    })
}

#[allow(dead_code)]
pub fn child_names(node: &Node<EntityDescriptor>) -> Vec<&str> {
    node.children().iter().map(|c| c.value().name()).collect()
}
