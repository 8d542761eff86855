use std::cell::RefCell;
use std::rc::Rc;

use agrod_core::{Level, Session, UploadedImage};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, FileReader, HtmlInputElement};

/// Adds a hidden `<input type=file>` whose selection is uploaded into `session`.
pub fn install(session: Rc<RefCell<Session>>) -> Result<HtmlInputElement, JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let input = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str("input is not an HtmlInputElement"))?;
    input.set_type("file");
    input.set_accept("image/*");
    input.set_hidden(true);
    if let Some(body) = document.body() {
        body.append_child(&input)?;
    }

    let onchange = Closure::<dyn FnMut(web_sys::Event)>::new({
        let input = input.clone();
        move |_: web_sys::Event| {
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            // picking the same file twice must fire change again
            input.set_value("");
            spawn_local(upload(file, session.clone()));
        }
    });
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();

    Ok(input)
}

async fn upload(file: File, session: Rc<RefCell<Session>>) {
    match read_data_uri(&file).await {
        Ok(data_uri) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte_len = file.size() as usize;
            session.borrow_mut().upload_image(UploadedImage {
                file_name: file.name(),
                byte_len,
                data_uri,
            });
        }
        Err(error) => {
            web_sys::console::error_1(&error);
            session.borrow_mut().notices_mut().post(
                format!("Could not read {}", file.name()),
                Level::Danger,
                crate::now(),
            );
        }
    }
}

async fn read_data_uri(file: &File) -> Result<String, JsValue> {
    let reader = FileReader::new()?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let onload = Closure::once(move |_: web_sys::Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once(move |_: web_sys::Event| {
            let _ = reject.call0(&JsValue::NULL);
        });

        reader.set_onloadend(Some(onload.as_ref().unchecked_ref()));
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        onload.forget();
        onerror.forget();
    });

    reader.read_as_data_url(file)?;
    JsFuture::from(promise).await?;

    reader
        .result()?
        .as_string()
        .ok_or_else(|| JsValue::from_str("FileReader returned no data URI"))
}
