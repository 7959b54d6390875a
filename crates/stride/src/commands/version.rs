pub fn run() -> anyhow::Result<()> {
    println!("stride {}", env!("CARGO_PKG_VERSION"));
    println!("Per-student performance tracking and deviation checks");
    Ok(())
}
