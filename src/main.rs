fn main() -> anyhow::Result<()> {
    pagelock::run()?;
    Ok(())
}
