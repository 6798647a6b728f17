use ioc::Bean;

#[derive(Bean)]
enum Mode {
    Fast,
}

fn main() {
    let _ = Mode::Fast;
}
