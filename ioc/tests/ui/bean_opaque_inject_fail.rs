use ioc::{Bean, Inject};

#[derive(Default, Bean)]
#[bean(opaque)]
struct Config {
    #[inject]
    limit: Inject<u32>,
}

fn main() {
    let _ = Config::default().limit;
}
