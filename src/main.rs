use cwdump::error::AppResult;

fn main() -> AppResult<()> {
    cwdump::entry::run()
}
