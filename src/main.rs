fn main() -> anyhow::Result<()> {
    casino_solitaire::run()
}
