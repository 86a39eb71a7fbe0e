//! Build scripts shared by several tests.

/// A typical Android module script mixing block, dotted and assignment forms.
pub const APP_MODULE: &str = r#"apply plugin: 'com.android.application'

android {
    compileSdkVersion 23
    buildToolsVersion "23.0.1"

    defaultConfig {
        applicationId "com.example.app"
        minSdkVersion 15
        targetSdkVersion 23
        versionCode 1
        versionName "1.0"
        manifestPlaceholders activityLabel: "app"
    }

    buildTypes {
        release {
            minifyEnabled false
            proguardFiles 'proguard-android.txt', 'proguard-rules.pro'
        }
    }

    productFlavors {
        free {
            applicationId "com.example.app.free"
        }
        paid {
            applicationId "com.example.app.paid"
        }
    }
}

android.buildTypes.debug.debuggable true

dependencies {
    // keep this comment
    compile fileTree(dir: 'libs', include: ['*.jar'])
    testCompile 'junit:junit:4.12'
}
"#;

/// Statements the parser keeps but the element tree cannot classify.
pub const WITH_UNRESOLVED: &str = "android {\n  = 3\n  compileSdkVersion 23\n}\n";
