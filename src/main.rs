fn main() {
    extman::run_cli();
}
