fn main() {
    if let Err(err) = mesh_topology::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
