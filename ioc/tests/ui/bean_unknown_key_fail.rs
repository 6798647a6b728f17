use ioc::{Bean, Inject};

trait Repo: Send + Sync {}

#[derive(Default, Bean)]
struct Service {
    #[inject(lazy)]
    repo: Inject<dyn Repo>,
}

fn main() {
    let _ = Service::default().repo;
}
