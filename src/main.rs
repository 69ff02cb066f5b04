use flagstaff::assets::AssetPaths;
use flagstaff::gfx::geometry::StarDensity;
use flagstaff::FlagstaffApp;

fn main() {
    env_logger::init();
    log::info!("starting flagstaff");

    FlagstaffApp::new(AssetPaths::default(), StarDensity::Sparse).run();
}
