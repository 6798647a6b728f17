use ioc::{Bean, BoxError, Container, Inject, PostConstruct, Scope};

trait Repository: Send + Sync {
    fn count(&self) -> usize;
}

trait Service: Send + Sync {}

#[derive(Default, Bean)]
#[bean(provides(dyn Repository))]
struct MemoryRepository;

impl Repository for MemoryRepository {
    fn count(&self) -> usize {
        1
    }
}

#[derive(Default, Bean)]
#[bean(provides(dyn Service))]
#[bean(post_construct)]
struct ServiceImpl {
    #[inject("repository")]
    repo: Inject<dyn Repository>,
    #[inject(name = "audit", optional)]
    audit: Inject<dyn Repository>,
    #[inject]
    by_capability: Inject<dyn Repository>,
    #[inject = "repository"]
    by_value: Inject<MemoryRepository>,
    plain: u32,
}

impl Service for ServiceImpl {}

impl PostConstruct for ServiceImpl {
    fn post_construct(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Default, Bean)]
struct Tuple(#[inject(optional = true)] Inject<dyn Service>, u8);

#[derive(Default, Bean)]
struct Unit;

#[derive(Default, Bean)]
#[bean(opaque)]
struct Settings {
    limit: usize,
}

fn main() {
    let container = Container::new();
    container.register("repository", MemoryRepository, Scope::Singleton).unwrap();
    container.register("service", ServiceImpl::default(), Scope::Singleton).unwrap();
    container.register("tuple", Tuple::default(), Scope::Prototype).unwrap();
    container.register("unit", Unit, Scope::Singleton).unwrap();
    container.register("settings", Settings { limit: 3 }, Scope::Singleton).unwrap();
    container.init().unwrap();

    let service = container.get_as::<ServiceImpl>("service").unwrap();
    assert_eq!(service.repo.count() + service.by_capability.count() + service.by_value.count(), 3);
    assert!(!service.audit.is_injected());
    assert_eq!(service.plain, 0);

    let tuple = container.get_as::<Tuple>("tuple").unwrap();
    assert!(tuple.0.is_injected());
    assert_eq!(tuple.1, 0);
    assert_eq!(container.get_as::<Settings>("settings").unwrap().limit, 3);
}
