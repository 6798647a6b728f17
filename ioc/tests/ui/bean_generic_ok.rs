use ioc::{Bean, Container, Inject, Scope};

trait Store: Send + Sync {}

#[derive(Default, Bean)]
#[bean(provides(dyn Store))]
struct MemoryStore;

impl Store for MemoryStore {}

#[derive(Default, Bean)]
struct Cached<T: Default + Send + Sync + 'static> {
    #[inject]
    store: Inject<dyn Store>,
    value: T,
}

fn main() {
    let container = Container::new();
    container.register("store", MemoryStore, Scope::Singleton).unwrap();
    container.register("cached", Cached::<u64>::default(), Scope::Singleton).unwrap();
    container.init().unwrap();

    let cached = container.get_as::<Cached<u64>>("cached").unwrap();
    assert!(cached.store.is_injected());
    assert_eq!(cached.value, 0);
}
