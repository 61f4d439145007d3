use std::{fs::File, io::Write, path::Path};

use quick_xml::{events::BytesText, Writer};

use super::petri_net_struct::{PetriNet, PlaceID};

/// Write `<tag><text>text</text></tag>`
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> std::io::Result<()> {
    writer.create_element(tag).write_inner_content(|w| {
        w.create_element("text")
            .write_text_content(BytesText::new(text))?;
        Ok::<(), std::io::Error>(())
    })?;
    Ok(())
}

///
/// Export a [`PetriNet`] to the PNML format and write the result to the provided writer
///
/// Nodes are written in a stable order (by id), so exporting the same net twice gives identical output.
///
pub fn export_petri_net_to_pnml<W: Write>(pn: &PetriNet, into_writer: W) -> Result<(), quick_xml::Error> {
    let mut writer = Writer::new_with_indent(into_writer, b' ', 4);
    let mut places: Vec<_> = pn.places.iter().collect();
    places.sort_by_key(|(id, _)| **id);
    let mut transitions: Vec<_> = pn.transitions.iter().collect();
    transitions.sort_by_key(|(id, _)| **id);

    writer.create_element("pnml").write_inner_content(|writer| {
        writer
            .create_element("net")
            .with_attributes(vec![
                ("id", "Alpha Miner PetriNet Export"),
                (
                    "type",
                    "http://www.pnml.org/version-2009/grammar/pnmlcoremodel",
                ),
            ])
            .write_inner_content(|writer| {
                writer
                    .create_element("page")
                    .with_attribute(("id", "n0"))
                    .write_inner_content(|writer| {
                        for (id, place) in &places {
                            let id_str = id.to_string();
                            writer
                                .create_element("place")
                                .with_attribute(("id", id_str.as_str()))
                                .write_inner_content(|writer| {
                                    write_text_element(
                                        writer,
                                        "name",
                                        place.label.as_deref().unwrap_or(&id_str),
                                    )?;
                                    if let Some(tokens) = pn
                                        .initial_marking
                                        .as_ref()
                                        .and_then(|m| m.get(&PlaceID::from(*place)))
                                    {
                                        write_text_element(
                                            writer,
                                            "initialMarking",
                                            &tokens.to_string(),
                                        )?;
                                    }
                                    Ok::<(), std::io::Error>(())
                                })?;
                        }
                        for (id, transition) in &transitions {
                            writer
                                .create_element("transition")
                                .with_attribute(("id", id.to_string().as_str()))
                                .write_inner_content(|writer| {
                                    write_text_element(
                                        writer,
                                        "name",
                                        transition.label.as_deref().unwrap_or("Tau"),
                                    )?;
                                    if transition.label.is_none() {
                                        writer
                                            .create_element("toolspecific")
                                            .with_attributes(vec![
                                                ("tool", "ProM"),
                                                ("version", "6.4"),
                                                ("activity", "$invisible$"),
                                                ("localNodeID", id.to_string().as_str()),
                                            ])
                                            .write_empty()?;
                                    }
                                    Ok::<(), std::io::Error>(())
                                })?;
                        }
                        for arc in &pn.arcs {
                            let (source_id, target_id) = arc.from_to.source_target();
                            writer
                                .create_element("arc")
                                .with_attribute(("id", format!("{source_id}{target_id}").as_str()))
                                .with_attribute(("source", source_id.to_string().as_str()))
                                .with_attribute(("target", target_id.to_string().as_str()))
                                .write_inner_content(|w| {
                                    write_text_element(w, "inscription", &arc.weight.to_string())
                                })?;
                        }
                        Ok::<(), std::io::Error>(())
                    })?;

                if let Some(final_markings) = &pn.final_markings {
                    writer
                        .create_element("finalmarkings")
                        .write_inner_content(|writer| {
                            for marking in final_markings {
                                writer.create_element("marking").write_inner_content(|writer| {
                                    for (place_id, tokens) in marking {
                                        writer
                                            .create_element("place")
                                            .with_attribute((
                                                "idref",
                                                place_id.get_uuid().to_string().as_str(),
                                            ))
                                            .write_inner_content(|writer| {
                                                writer
                                                    .create_element("text")
                                                    .write_text_content(BytesText::new(
                                                        &tokens.to_string(),
                                                    ))?;
                                                Ok::<(), std::io::Error>(())
                                            })?;
                                    }
                                    Ok::<(), std::io::Error>(())
                                })?;
                            }
                            Ok::<(), std::io::Error>(())
                        })?;
                }
                Ok::<(), std::io::Error>(())
            })?;
        Ok::<(), std::io::Error>(())
    })?;
    Ok(())
}

/// Export a [`PetriNet`] to a `.pnml` file (specified through path)
///
/// Also consider using [`PetriNet::export_pnml`] for convenience or [`export_petri_net_to_pnml`] for more control.
pub fn export_petri_net_to_pnml_path<P: AsRef<Path>>(
    pn: &PetriNet,
    path: P,
) -> Result<(), quick_xml::Error> {
    let mut file_writer = std::io::BufWriter::new(File::create(path)?);
    export_petri_net_to_pnml(pn, &mut file_writer)?;
    file_writer.flush()?;
    Ok(())
}
