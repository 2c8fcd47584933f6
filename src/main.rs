fn main() -> std::process::ExitCode {
    tas_dash_lib::run()
}
