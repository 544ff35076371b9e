use hinac_lib as hinac;

fn main() {
    let options = hinac::options::get();
    hinac::logger::init(options.verbose).expect("Logger initialization failed");
    log::info!("hinac started on {}", options.input);

    if let Err(()) = hinac::driver::drive(options) {
        std::process::exit(1);
    }
}
