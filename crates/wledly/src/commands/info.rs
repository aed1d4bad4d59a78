//! Device info handler.

use serde::Serialize;

use wledly_core::{Controller, CoreError, DeviceInfo, DeviceState, Plugin};

use crate::cli::{ControllerRef, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct InfoView {
    controller: Controller,
    info: DeviceInfo,
    state: DeviceState,
}

fn detail(v: &InfoView) -> String {
    let (info, state) = (&v.info, &v.state);
    let preset = if state.ps > 0 {
        state.ps.to_string()
    } else {
        "-".into()
    };
    let mut lines = vec![
        format!("Controller: {}", v.controller.display_name),
        format!("Address:    {}", v.controller.address),
        format!("Device:     {}", info.display_name().unwrap_or("-")),
        format!("Firmware:   {}", info.ver),
        format!("Power:      {}", if state.on { "on" } else { "off" }),
        format!("Brightness: {}", state.bri),
        format!("Preset:     {preset}"),
        format!("Effects:    {}", info.fxcount),
        format!("Palettes:   {}", info.palcount),
    ];
    if let Some(leds) = info.maxleds {
        lines.push(format!("Max LEDs:   {leds}"));
    }
    if let Some(ref mac) = info.mac {
        lines.push(format!("MAC:        {mac}"));
    }
    if info.live {
        lines.push("Live:       receiving realtime data".into());
    }
    lines.join("\n")
}

pub async fn handle(plugin: &Plugin, args: ControllerRef, global: &GlobalOpts) -> Result<(), CliError> {
    let controller = util::resolve_controller(plugin.registry(), &args.controller).await?;
    let client = plugin
        .registry()
        .connector()
        .connect(&controller.address)
        .map_err(CoreError::from)?;

    let (info, state) = tokio::join!(client.get_info(), client.get_state());
    let view = InfoView {
        controller,
        info: info.map_err(CoreError::from)?,
        state: state.map_err(CoreError::from)?,
    };

    let out = output::render_single(&global.output, &view, detail, |v| v.info.ver.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
