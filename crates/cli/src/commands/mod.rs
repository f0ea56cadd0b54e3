pub mod countdown;
pub mod names;
pub mod stats;

use dashboard_lib::Navigation;
use url::Url;

use crate::output::print_info;

/// Report a navigation the page would perform
pub fn announce_redirect(base: &Url, target: &Navigation) {
    match target.resolve(base) {
        Ok(url) => print_info(&format!("Redirecting to {}", url)),
        Err(_) => print_info(&format!("Redirecting to {}", target)),
    }
}
