pub mod host;

use std::sync::Once;

use jni::objects::JString;
use jni::sys::{jboolean, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;

pub use host::EngineHost;
pub use jni;

/// Install the Android log backend (tag `GCube`) and route panic messages into it.
/// Safe to call repeatedly; only the first call does anything.
pub fn init_logging() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Info)
                .with_tag("GCube"),
        );

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log::error!("{info}");
            default_hook(info);
        }));
    });
}

/// Read a Java string argument. Null or unreadable strings become empty.
pub fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> String {
    if value.is_null() {
        return String::new();
    }
    match env.get_string(value) {
        Ok(text) => text.into(),
        Err(err) => {
            log::warn!("cannot read Java string: {err}");
            String::new()
        }
    }
}

pub fn to_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// Generate the `com.gclue.gcube.NDKInterface` JNI exports for a game.
///
/// Expands to a `static` [`EngineHost`] plus one `extern "system"` function
/// per native method declared on the Java class, and `onLowMemory`.
///
/// # Usage
///
/// ```ignore
/// mod game;
/// use game::MyGame;
///
/// gcube_android::export_engine!(MyGame, MyGame::new);
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `gcube_engine::Game`
/// - `$make`: A `fn() -> $game_type` building a fresh game for each `onInit`
#[macro_export]
macro_rules! export_engine {
    ($game_type:ty, $make:expr) => {
        static HOST: $crate::EngineHost<$game_type> = $crate::EngineHost::new($make);

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_step(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
            dt: $crate::jni::sys::jfloat,
        ) {
            HOST.step(dt);
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onInit(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            $crate::init_logging();
            HOST.on_init();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onTerminate(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            HOST.on_terminate();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onPause(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            HOST.on_pause();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onResume(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            HOST.on_resume();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onContextChanged(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            HOST.on_context_changed();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onSizeChanged(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
            width: $crate::jni::sys::jint,
            height: $crate::jni::sys::jint,
            orientation: $crate::jni::sys::jint,
        ) {
            HOST.on_size_changed(width, height, orientation);
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onPressBackKey(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) -> $crate::jni::sys::jboolean {
            $crate::to_jboolean(HOST.on_press_back_key())
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onTouchEvent(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
            action: $crate::jni::sys::jint,
            x: $crate::jni::sys::jfloat,
            y: $crate::jni::sys::jfloat,
            time: $crate::jni::sys::jlong,
        ) {
            HOST.on_touch_event(action, x, y, time);
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onOrientationChanged(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
            yaw: $crate::jni::sys::jfloat,
            pitch: $crate::jni::sys::jfloat,
            roll: $crate::jni::sys::jfloat,
        ) {
            HOST.on_orientation_changed(yaw, pitch, roll);
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_sendGameEvent<'local>(
            mut env: $crate::jni::JNIEnv<'local>,
            _class: $crate::jni::objects::JClass<'local>,
            kind: $crate::jni::sys::jint,
            param1: $crate::jni::sys::jint,
            param2: $crate::jni::sys::jint,
            param3: $crate::jni::sys::jint,
            param4: $crate::jni::sys::jint,
            param5: $crate::jni::objects::JString<'local>,
        ) {
            let text = $crate::read_string(&mut env, &param5);
            HOST.send_game_event(kind, [param1, param2, param3, param4], text);
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_onLowMemory(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) {
            HOST.on_low_memory();
        }

        // ---- Queries ----

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_getFrameRate(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) -> $crate::jni::sys::jint {
            HOST.get_frame_rate()
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_useOrientationSensor(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) -> $crate::jni::sys::jboolean {
            $crate::to_jboolean(HOST.use_orientation_sensor())
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn Java_com_gclue_gcube_NDKInterface_getSupportedOrientation(
            _env: $crate::jni::JNIEnv<'_>,
            _class: $crate::jni::objects::JClass<'_>,
        ) -> $crate::jni::sys::jint {
            HOST.get_supported_orientation()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jboolean_encoding() {
        assert_eq!(to_jboolean(true), JNI_TRUE);
        assert_eq!(to_jboolean(false), JNI_FALSE);
    }
}
