#![allow(missing_docs)]

use ioc::{Bean, Container, Inject, Scope};

use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn container() -> Container {
    let container = Container::new();
    container.register("repository", Repository, Scope::Singleton).unwrap();
    container.register("service", Service::default(), Scope::Singleton).unwrap();
    container.register("request", Request::default(), Scope::Prototype).unwrap();
    container
}

fn benchmark(c: &mut Criterion) {
    let ready = container();
    ready.init().unwrap();

    c.bench_function("singleton", |b| b.iter(
        || ready.get(black_box("service"))
    ));
    c.bench_function("singleton_as_capability", |b| b.iter(
        || ready.get_as::<dyn Store>(black_box("repository")).unwrap()
    ));
    c.bench_function("by_capability", |b| b.iter(
        || ready.get_by_capability::<dyn Store>().unwrap()
    ));
    c.bench_function("prototype", |b| b.iter(
        || ready.get(black_box("request"))
    ));
    c.bench_function("init", |b| b.iter_batched(
        container,
        |fresh| fresh.init().unwrap(),
        BatchSize::SmallInput
    ));
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

trait Store: Send + Sync {}

#[derive(Default, Debug, Bean)]
#[bean(provides(dyn Store))]
struct Repository;

impl Store for Repository {}

#[derive(Default, Debug, Bean)]
struct Service {
    #[inject("repository")]
    repo: Inject<dyn Store>,
}

#[derive(Default, Debug, Bean)]
struct Request {
    #[inject("service")]
    service: Inject<Service>,
    #[inject]
    store: Inject<dyn Store>,
}
