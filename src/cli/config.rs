use crate::error::Result;
use crate::filter::TimePeriod;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(data_file: Option<&str>, period: Option<TimePeriod>) -> Result<()> {
    let mut settings = load_settings();

    if data_file.is_none() && period.is_none() {
        println!("data_file       {}", settings.data_file);
        println!("default_period  {}", settings.default_period);
        return Ok(());
    }

    if let Some(path) = data_file {
        settings.data_file = shellexpand_path(path);
    }
    if let Some(p) = period {
        settings.default_period = p;
    }
    save_settings(&settings)?;
    println!("Saved {}", settings_path().display());
    Ok(())
}
